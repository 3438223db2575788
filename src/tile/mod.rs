pub(crate) mod assemble;
pub(crate) mod scratch;
pub(crate) mod slicer;
