use tracing::{debug, error};

use crate::{page::Mutation, Api, ClientResult, PageContext};

use super::{Feed, ProfileCard};

/// What happens when a load is triggered while another is still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overlap {
    /// Both requests go out with the same cursor and both pages get appended.
    #[default]
    Allow,
    /// The second trigger is dropped.
    Guard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn at_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePage {
    pub profiles: Vec<ProfileCard>,
    /// Continues after the last profile of this page, in server order.
    pub next: PageContext,
}

pub async fn fetch_profiles(api: &Api, ctx: PageContext) -> ClientResult<ProfilePage> {
    let profiles = api.load_profiles(ctx).await?;
    let next = ctx.next(profiles.last().map(|profile| profile.id));
    Ok(ProfilePage { profiles, next })
}

pub struct FeedPager {
    feed: Feed,
    ctx: PageContext,
    overlap: Overlap,
    in_flight: usize,
}

impl FeedPager {
    pub fn new(overlap: Overlap) -> FeedPager {
        FeedPager {
            feed: Feed::default(),
            ctx: PageContext::default(),
            overlap,
            in_flight: 0,
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn context(&self) -> PageContext {
        self.ctx
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Reads the cursor for a new request. Nothing is snapshotted: under
    /// [`Overlap::Allow`] a second call before [`finish_load`](Self::finish_load)
    /// hands out the same cursor again.
    pub fn begin_load(&mut self) -> Option<PageContext> {
        if self.overlap == Overlap::Guard && self.in_flight > 0 {
            debug!("profile page already in flight, skipping");
            return None;
        }
        self.in_flight += 1;
        Some(self.ctx)
    }

    pub fn finish_load(&mut self, page: ClientResult<ProfilePage>) -> Vec<Mutation> {
        self.in_flight = self.in_flight.saturating_sub(1);

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                error!("error loading profiles: {e}");
                return Vec::new();
            }
        };

        if !page.profiles.is_empty() {
            self.ctx = page.next;
        }

        self.feed.append(&page.profiles)
    }

    pub async fn load_profiles(&mut self, api: &Api) -> Vec<Mutation> {
        let Some(ctx) = self.begin_load() else {
            return Vec::new();
        };
        let page = fetch_profiles(api, ctx).await;
        self.finish_load(page)
    }

    pub async fn on_scroll(&mut self, metrics: ScrollMetrics, api: &Api) -> Vec<Mutation> {
        if !metrics.at_bottom() {
            return Vec::new();
        }
        self.load_profiles(api).await
    }

    pub fn open_matches(&mut self) -> Vec<Mutation> {
        self.feed.set_matches(true)
    }

    pub fn close_matches(&mut self) -> Vec<Mutation> {
        self.feed.set_matches(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64) -> ProfileCard {
        ProfileCard {
            id,
            username: format!("user{id}"),
            age: None,
            bio: String::new(),
            photo: "/media/default.jpg".into(),
        }
    }

    fn page(ctx: PageContext, ids: &[i64]) -> ProfilePage {
        let profiles: Vec<ProfileCard> = ids.iter().copied().map(card).collect();
        ProfilePage { next: ctx.next(ids.last().copied()), profiles }
    }

    fn card_ids(mutations: &[Mutation]) -> Vec<i64> {
        mutations.iter()
            .filter_map(|m| match m {
                Mutation::Append { html, .. } => html.split(r#"data-profile-id=""#).nth(1),
                _ => None,
            })
            .filter_map(|rest| rest.split('"').next()?.parse().ok())
            .collect()
    }

    #[test]
    fn scroll_bottom_is_inclusive() {
        let at = |scroll_top| ScrollMetrics { scroll_top, client_height: 200.0, scroll_height: 1000.0 };
        assert!(!at(799.0).at_bottom());
        assert!(at(800.0).at_bottom());
        assert!(at(801.5).at_bottom());
    }

    #[test]
    fn overlapping_loads_share_a_stale_cursor() {
        let mut pager = FeedPager::new(Overlap::Allow);
        let first = pager.begin_load().unwrap();
        let second = pager.begin_load().unwrap();
        assert_eq!(first, second);
        assert_eq!(pager.in_flight(), 2);

        let mut mutations = pager.finish_load(Ok(page(first, &[1, 2])));
        mutations.extend(pager.finish_load(Ok(page(second, &[1, 2]))));

        assert_eq!(card_ids(&mutations), vec![1, 2, 1, 2]);
        assert_eq!(pager.feed().shown(), 4);
        assert_eq!(pager.context(), PageContext::after(2));
        assert_eq!(pager.in_flight(), 0);
    }

    #[test]
    fn guard_drops_the_second_trigger() {
        let mut pager = FeedPager::new(Overlap::Guard);
        let first = pager.begin_load().unwrap();
        assert_eq!(pager.begin_load(), None);

        pager.finish_load(Ok(page(first, &[4])));
        assert_eq!(pager.begin_load(), Some(PageContext::after(4)));
    }

    #[test]
    fn failed_load_keeps_the_pager_armed() {
        let mut pager = FeedPager::new(Overlap::Guard);
        pager.begin_load().unwrap();
        assert!(pager.finish_load(Err("boom".into())).is_empty());
        assert_eq!(pager.begin_load(), Some(PageContext::default()));
    }

    #[test]
    fn empty_page_keeps_the_cursor() {
        let mut pager = FeedPager::new(Overlap::Allow);
        let ctx = pager.begin_load().unwrap();
        pager.finish_load(Ok(page(ctx, &[3])));
        let ctx = pager.begin_load().unwrap();
        assert!(pager.finish_load(Ok(page(ctx, &[]))).is_empty());
        assert_eq!(pager.context(), PageContext::after(3));
    }
}
