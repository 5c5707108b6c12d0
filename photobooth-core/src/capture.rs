pub(crate) mod camera;
pub(crate) mod encode;
pub(crate) mod upload;
pub(crate) mod video;
