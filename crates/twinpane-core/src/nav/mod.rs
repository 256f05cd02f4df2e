//! The current-directory side of the browser.
//!
//! [`list::VirtualList`] owns the rows of one directory. It builds them from
//! [`entry::ListEntry`] values, orders them with [`sort`], narrows them with
//! [`filter`] and remembers visits in [`history::NavigationHistory`].

pub mod entry;
pub mod filter;
pub mod history;
pub mod list;
pub mod sort;
