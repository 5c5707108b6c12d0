pub(crate) mod client;
pub(crate) mod gemini;
pub(crate) mod proxy;
pub(crate) mod wire;
