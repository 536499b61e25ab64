mod resolver;

pub use resolver::TextureResolver;
