//! Annotation form: blind review slots, rating controls and page rendering

pub mod layout;
pub mod markdown;
pub mod render;

pub use layout::{field_name, review_order, FormLayout, RenderedPoint, ReviewSlot};
pub use markdown::{html_escape, render_review_markdown};
pub use render::{
    render_confirmation, render_error_page, render_form_page, render_paper_selection,
    render_user_selection, FormView,
};
