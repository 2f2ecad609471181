//! EU TARIC goods description service adapter.

pub mod envelope;
pub mod soap_client;

pub use envelope::{goods_description_envelope, ResponseParser, UnparsedResponse};
pub use soap_client::TaricSoapClient;
