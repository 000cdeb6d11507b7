mod documents;

pub use documents::DocumentService;
