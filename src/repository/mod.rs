mod assessment_repository;
mod questionnaire_repository;
mod user_repository;

pub use assessment_repository::*;
pub use questionnaire_repository::*;
pub use user_repository::*;
