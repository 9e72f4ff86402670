//! Page-level widgets outside the listing carousels: the support page FAQ
//! accordion and the hostel compare tray.

pub mod compare;
pub mod faq;

pub use compare::{COMPARE_MAX, CompareError, CompareSnapshot, CompareTray, HostelPick};
pub use faq::{Faq, FaqItem, FaqParseError, FaqSnapshot};
