//! FX module - conversion rate models and provider trait.

mod fx_model;
mod fx_traits;

pub use fx_model::RateResponse;
pub use fx_traits::{RateProviderTrait, StaticRateProvider};
