pub mod traits;
pub mod greader;

pub use traits::ReaderApi;
pub use greader::GReaderClient;
