pub mod lanes_view;
pub mod theme;
pub mod toolbar;
