use crate::core::models::activity_entry::ActivityEntry;

/// Merge per-kind entry lists into one list, most recent first.
///
/// Lists are concatenated in the order given and then stably sorted by
/// time, so entries sharing an instant keep their concatenation order.
pub fn newest_first<I>(lists: I) -> Vec<ActivityEntry>
where
    I: IntoIterator<Item = Vec<ActivityEntry>>,
{
    let mut merged: Vec<ActivityEntry> = lists.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.time.cmp(&a.time));
    merged
}
