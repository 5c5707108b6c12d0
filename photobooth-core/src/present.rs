pub(crate) mod ffmpeg;
pub(crate) mod presenter;
pub(crate) mod sink;
pub(crate) mod timed;
