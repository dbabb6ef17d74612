pub use kurbo::Rect;
