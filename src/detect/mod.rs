// Content sniffing — identify image formats from leading magic bytes.

pub mod image;
