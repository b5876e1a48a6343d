//! Filter, sort and pagination primitives shared by repositories and
//! catalog providers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{RegistryError, Result};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order
    #[default]
    Ascending,
    /// Descending order
    Descending,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison.
    ///
    /// Descending inverts the comparator result instead of reversing a sorted
    /// sequence, so a stable sort keeps equal keys in their original order.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(SortOrder::Ascending),
            "DESC" | "DESCENDING" => Ok(SortOrder::Descending),
            _ => Err(RegistryError::InvalidArgument(format!(
                "Invalid sort order: {}",
                s
            ))),
        }
    }
}

/// Page size and starting offset of a list call
///
/// No cursor survives between calls: every call re-evaluates the full
/// filtered and sorted set and then slices it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Maximum items to return; `None` returns everything after `offset`
    pub page_size: Option<u32>,
    /// Number of matching items to skip
    pub offset: u32,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            offset: 0,
        }
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Reject a zero page size
    pub fn validate(&self) -> Result<()> {
        if self.page_size == Some(0) {
            return Err(RegistryError::InvalidArgument(
                "page size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Slice an already filtered and sorted sequence into a page
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let offset = (self.offset as usize).min(items.len());
        let take = self
            .page_size
            .map(|size| size as usize)
            .unwrap_or(usize::MAX);
        let items: Vec<T> = items.into_iter().skip(offset).take(take).collect();
        Page::new(items, self.page_size, total, self.offset)
    }
}

/// One page of list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this page
    pub items: Vec<T>,
    /// Number of items in this page
    pub size: u32,
    /// Requested page size, or the returned item count when unbounded
    pub page_size: u32,
    /// Number of items matching the filter as of this call
    pub total: u64,
    /// Offset this page starts at
    pub offset: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_size: Option<u32>, total: u64, offset: u32) -> Self {
        let size = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Self {
            items,
            size,
            page_size: page_size.unwrap_or(size),
            total,
            offset,
        }
    }

    /// Check if more matching items exist past this page
    pub fn has_more(&self) -> bool {
        (self.offset as u64) + (self.size as u64) < self.total
    }

    /// Convert every item, keeping the paging metadata
    pub fn try_map<U, E>(
        self,
        f: impl FnMut(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Page<U>, E> {
        let items = self
            .items
            .into_iter()
            .map(f)
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            size: self.size,
            page_size: self.page_size,
            total: self.total,
            offset: self.offset,
        })
    }
}

/// Case-insensitive substring filter matched with OR semantics across fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    needle: Option<String>,
}

impl TextQuery {
    /// Build a filter; an absent or empty query matches everything
    pub fn new(query: Option<&str>) -> Self {
        let needle = query
            .filter(|q| !q.is_empty())
            .map(|q| q.to_lowercase());
        Self { needle }
    }

    /// Lowercased query, if any filtering applies
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// True when any of the fields contains the query
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Parse a string-encoded epoch timestamp, treating absent or unparsable
/// values as zero
pub fn parse_epoch_lenient(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}
