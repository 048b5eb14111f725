pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod reference;
pub mod retry;
pub mod sample_xml;
pub mod validator;
