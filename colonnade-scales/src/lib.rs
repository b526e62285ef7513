pub mod domain;
pub mod error;
pub mod layout;

pub use domain::{calc_value_domain, ValueDomain};
pub use layout::{category_layout, CategoryLayout, LayoutOptions};
