mod laboratory;

pub use laboratory::Laboratory;
