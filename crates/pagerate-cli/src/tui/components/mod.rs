//! UI components: status bar, scrollbars, page dots, quality pills, toasts

pub mod page_indicator;
pub mod pills;
pub mod scrollbars;
pub mod status_bar;
pub mod toast;

pub use page_indicator::render_page_indicator;
pub use pills::{pill_rows, render_pills};
pub use scrollbars::render_page_scrollbar;
pub use status_bar::{render_status_bar, StatusInfo};
pub use toast::{render_toasts, Toast, ToastQueue};
