#![doc(html_no_source)]

mod partfuse;
pub use partfuse::Partfuse;

// Reexport all crates
pub use partfuse_job;
pub use partfuse_mesh;
pub use partfuse_scene;
pub use partfuse_transform;
pub use partfuse_union;
