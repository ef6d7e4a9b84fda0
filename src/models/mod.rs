mod assessment;
mod questionnaire;
mod user;

pub use assessment::*;
pub use questionnaire::*;
pub use user::*;
