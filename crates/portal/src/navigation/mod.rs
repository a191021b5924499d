//! Routes, role menus, page guards and the header search box.

mod guard;
mod menu;
pub mod routes;
mod search;

pub use guard::{Guard, dashboard_root, protect};
pub use menu::{
    BILLING_CRITICAL_DAYS, BILLING_WARNING_DAYS, BadgeState, Icon, MenuItem, count_label,
    menu_for, menu_for_stored,
};
pub use routes::{dashboard_redirect, landing_route};
pub use search::search_route;
