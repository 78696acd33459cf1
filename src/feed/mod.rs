mod card;
mod pager;

pub use card::{Feed, ProfileCard};
pub use pager::{fetch_profiles, FeedPager, Overlap, ProfilePage, ScrollMetrics};
