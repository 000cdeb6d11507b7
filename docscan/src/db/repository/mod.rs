mod documents;

pub use documents::DocumentRepository;
