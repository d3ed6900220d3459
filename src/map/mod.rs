pub mod view;

pub use view::{MapView, Marker, POPUP_MAX_WIDTH, popup_html};
