pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod layout;
pub(crate) mod model;
