//! Page type for paginated list results.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Post;
use crate::model::PostId;

/// A page of list results with the total number of matching records.
///
/// Records stay in the order the provider returned them; the provider's sort
/// is authoritative and the table never re-sorts a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    records: Vec<Post>,
    /// Number of records matching the filters, across all pages.
    total_count: usize,
}

impl Page {
    /// Creates a new page.
    pub fn new(records: Vec<Post>, total_count: usize) -> Self {
        Self { records, total_count }
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Post] {
        &self.records
    }

    /// Returns the ids of the records, in page order.
    pub fn ids(&self) -> Vec<PostId> {
        self.records.iter().map(|post| post.id).collect()
    }

    /// Returns `true` if `id` is on this page.
    pub fn contains(&self, id: PostId) -> bool {
        self.records.iter().any(|post| post.id == id)
    }

    /// Returns the record with `id`, if it is on this page.
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.records.iter().find(|post| post.id == id)
    }

    /// Returns the total record count.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostStatus;

    #[test]
    fn test_lookup_by_id() {
        let posts = [3u64, 1]
            .into_iter()
            .map(|i| Post::new(i, format!("Post {}", i), PostStatus::Draft, "2024-01-01T00:00:00Z"))
            .collect();
        let page = Page::new(posts, 25);

        assert_eq!(page.ids(), vec![PostId(3), PostId(1)]);
        assert!(page.contains(PostId(1)));
        assert!(!page.contains(PostId(2)));
        assert_eq!(page.get(PostId(3)).map(|post| post.title.as_str()), Some("Post 3"));
        assert_eq!(page.total_count(), 25);
    }
}
