mod assessment_service;
mod auth_service;
mod questionnaire_service;

pub use assessment_service::*;
pub use auth_service::*;
pub use questionnaire_service::*;

#[cfg(test)]
mod tests;
