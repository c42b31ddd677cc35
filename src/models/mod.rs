pub mod status;
pub mod category;
pub mod department;
pub mod owner;
pub mod plan;
pub mod activity;
pub mod achievement;
pub mod monthly_approval;
pub mod evidence;

pub use status::{AchievementStatus, ActivityCategory, ApprovalStatus, VerifyStatus};
pub use category::{Category, CategoryUpdate, NewCategory};
pub use department::Department;
pub use owner::{Owner, OwnerUpdate};
pub use plan::{NewPlan, Plan, PlanUpdate};
pub use activity::{Activity, ActivityUpdate, NewActivity};
pub use achievement::{weighted_score, Achievement, AchievementUpdate};
pub use monthly_approval::MonthlyApproval;
pub use evidence::Evidence;
