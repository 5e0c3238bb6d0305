pub mod decode;
pub mod pack;
pub mod scan;
