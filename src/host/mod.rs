//! Request host.
//!
//! Reads length-prefixed JSON requests (4-byte little-endian length, then the body) and
//! answers each with one framed JSON response. Requests are tagged by `"op"`; responses
//! carry either `data` or an `error` with a coarse `kind`.

use crate::constants::{MAX_EVIDENCE_BYTES, MAX_MESSAGE_SIZE};
use crate::error::{AppError, ErrorKind};
use crate::models::{
    AchievementUpdate, ActivityUpdate, ApprovalStatus, CategoryUpdate, NewActivity, NewCategory,
    NewPlan, Owner, OwnerUpdate, PlanUpdate, VerifyStatus,
};
use crate::services::EvidenceFile;
use crate::IppApp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ListCategories,
    GetCategory { id: i64 },
    CreateCategory(NewCategory),
    UpdateCategory { id: i64, changes: CategoryUpdate },
    DeleteCategory { id: i64 },

    ListDepartments,
    GetDepartment { id: i64 },
    CreateDepartment { name: String },
    RenameDepartment { id: i64, name: String },
    DeleteDepartment { id: i64 },

    ListOwners,
    GetOwner { id: String },
    CreateOwner(Owner),
    UpdateOwner { id: String, changes: OwnerUpdate },
    DeleteOwner { id: String },

    ListPlans,
    GetPlan { id: String },
    ListPlansByOwner { owner_id: String },
    GetActivePlan { owner_id: String },
    CreatePlan(NewPlan),
    CreatePlanWithActivities { plan: NewPlan, activities: Vec<NewActivity> },
    UpdatePlan { id: String, changes: PlanUpdate },
    DeletePlan { id: String },
    SubmitPlan { id: String },
    UnsubmitPlan { id: String },
    VerifyPlan { id: String, status: VerifyStatus },
    ApprovePlan { id: String, status: ApprovalStatus },
    ListMonthlyApprovals { plan_id: String },
    GetMonthlyApproval { id: i64 },
    DecideMonthlyApproval { id: i64, status: ApprovalStatus },

    ListActivities { plan_id: String },
    CreateActivity { plan_id: String, activity: NewActivity },
    UpdateActivity { plan_id: String, name: String, changes: ActivityUpdate },
    DeleteActivity { plan_id: String, name: String },

    ListAchievements { plan_id: String, activity: String },
    GetAchievement { plan_id: String, activity: String, month: u8 },
    UpdateAchievement { plan_id: String, activity: String, month: u8, changes: AchievementUpdate },
    VerifyAchievement { plan_id: String, activity: String, month: u8, status: VerifyStatus },
    ApproveAchievement { plan_id: String, activity: String, month: u8, status: ApprovalStatus },

    ListEvidence { plan_id: String, activity: String, month: u8 },
    CreateEvidence {
        plan_id: String,
        activity: String,
        month: u8,
        source_path: String,
        file_name: Option<String>,
        description: Option<String>,
    },
    UpdateEvidence {
        id: i64,
        source_path: Option<String>,
        file_name: Option<String>,
        description: Option<String>,
    },
    DeleteEvidence { id: i64 },

    GetSummary { plan_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: &AppError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody {
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}

/// Read a local file to attach as evidence. The stored name defaults to the file's own name.
fn load_evidence_file(source_path: &str, file_name: Option<String>) -> Result<EvidenceFile, AppError> {
    let invalid = |reason: String| AppError::InvalidInput {
        field: "source_path",
        reason,
    };

    let path = Path::new(source_path);
    let metadata = fs::metadata(path).map_err(|e| invalid(format!("cannot read '{source_path}': {e}")))?;
    if !metadata.is_file() {
        return Err(invalid(format!("'{source_path}' is not a file")));
    }
    if metadata.len() > MAX_EVIDENCE_BYTES {
        return Err(invalid(format!(
            "'{source_path}' is {} bytes, the limit is {MAX_EVIDENCE_BYTES}",
            metadata.len()
        )));
    }

    let file_name = match file_name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| invalid(format!("'{source_path}' has no file name")))?,
    };
    let content = fs::read(path).map_err(|e| invalid(format!("cannot read '{source_path}': {e}")))?;
    Ok(EvidenceFile { file_name, content })
}

pub struct RequestHost {
    app: IppApp,
}

impl RequestHost {
    pub fn new(app: IppApp) -> Self {
        Self { app }
    }

    /// Serve requests until the reader is exhausted.
    ///
    /// A body that is not a valid request gets an error response; a broken frame ends
    /// the loop with an I/O error.
    pub fn run<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> io::Result<()> {
        loop {
            let body = read_frame(reader)?;
            let response = match serde_json::from_slice::<Request>(&body) {
                Ok(request) => self.handle(request),
                Err(e) => {
                    log::warn!("Rejected malformed request: {e}");
                    Response::failure(&AppError::InvalidInput {
                        field: "request",
                        reason: e.to_string(),
                    })
                }
            };
            write_frame(writer, &response)?;
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(e) => Response::failure(&e),
        }
    }

    fn dispatch(&self, request: Request) -> Result<Value, AppError> {
        let app = &self.app;
        match request {
            Request::ListCategories => to_data(app.categories.find_all()?),
            Request::GetCategory { id } => to_data(app.categories.find_by_id(id)?),
            Request::CreateCategory(new) => to_data(app.categories.create(&new)?),
            Request::UpdateCategory { id, changes } => to_data(app.categories.update(id, &changes)?),
            Request::DeleteCategory { id } => to_data(app.categories.delete(id)?),

            Request::ListDepartments => to_data(app.directory.find_all_departments()?),
            Request::GetDepartment { id } => to_data(app.directory.find_department(id)?),
            Request::CreateDepartment { name } => to_data(app.directory.create_department(&name)?),
            Request::RenameDepartment { id, name } => to_data(app.directory.rename_department(id, &name)?),
            Request::DeleteDepartment { id } => to_data(app.directory.delete_department(id)?),

            Request::ListOwners => to_data(app.directory.find_all_owners()?),
            Request::GetOwner { id } => to_data(app.directory.find_owner(&id)?),
            Request::CreateOwner(owner) => to_data(app.directory.create_owner(&owner)?),
            Request::UpdateOwner { id, changes } => to_data(app.directory.update_owner(&id, &changes)?),
            Request::DeleteOwner { id } => to_data(app.directory.delete_owner(&id)?),

            Request::ListPlans => to_data(app.plans.find_all()?),
            Request::GetPlan { id } => to_data(app.plans.find_by_id(&id)?),
            Request::ListPlansByOwner { owner_id } => to_data(app.plans.find_by_owner(&owner_id)?),
            Request::GetActivePlan { owner_id } => to_data(app.plans.find_active_by_owner(&owner_id)?),
            Request::CreatePlan(new) => to_data(app.plans.create(&new)?),
            Request::CreatePlanWithActivities { plan, activities } => {
                to_data(app.plans.create_with_activities(&plan, &activities)?)
            }
            Request::UpdatePlan { id, changes } => to_data(app.plans.update(&id, &changes)?),
            Request::DeletePlan { id } => to_data(app.plans.delete(&id)?),
            Request::SubmitPlan { id } => to_data(app.plans.submit(&id)?),
            Request::UnsubmitPlan { id } => to_data(app.plans.unsubmit(&id)?),
            Request::VerifyPlan { id, status } => to_data(app.plans.verify(&id, status)?),
            Request::ApprovePlan { id, status } => to_data(app.plans.approve(&id, status)?),
            Request::ListMonthlyApprovals { plan_id } => to_data(app.plans.list_monthly_approvals(&plan_id)?),
            Request::GetMonthlyApproval { id } => to_data(app.plans.get_monthly_approval(id)?),
            Request::DecideMonthlyApproval { id, status } => {
                to_data(app.plans.decide_monthly_approval(id, status)?)
            }

            Request::ListActivities { plan_id } => to_data(app.activities.list_by_plan(&plan_id)?),
            Request::CreateActivity { plan_id, activity } => to_data(app.activities.create(&plan_id, &activity)?),
            Request::UpdateActivity { plan_id, name, changes } => {
                to_data(app.activities.update(&plan_id, &name, &changes)?)
            }
            Request::DeleteActivity { plan_id, name } => to_data(app.activities.delete(&plan_id, &name)?),

            Request::ListAchievements { plan_id, activity } => {
                to_data(app.achievements.list_by_activity(&plan_id, &activity)?)
            }
            Request::GetAchievement { plan_id, activity, month } => {
                to_data(app.achievements.find(&plan_id, &activity, month)?)
            }
            Request::UpdateAchievement { plan_id, activity, month, changes } => {
                to_data(app.achievements.update_value(&plan_id, &activity, month, &changes)?)
            }
            Request::VerifyAchievement { plan_id, activity, month, status } => {
                to_data(app.achievements.verify(&plan_id, &activity, month, status)?)
            }
            Request::ApproveAchievement { plan_id, activity, month, status } => {
                to_data(app.achievements.approve(&plan_id, &activity, month, status)?)
            }

            Request::ListEvidence { plan_id, activity, month } => {
                to_data(app.evidence.list_by_achievement(&plan_id, &activity, month)?)
            }
            Request::CreateEvidence {
                plan_id,
                activity,
                month,
                source_path,
                file_name,
                description,
            } => {
                let file = load_evidence_file(&source_path, file_name)?;
                to_data(app.evidence.create(&plan_id, &activity, month, &file, description.as_deref())?)
            }
            Request::UpdateEvidence {
                id,
                source_path,
                file_name,
                description,
            } => {
                let file = source_path
                    .map(|path| load_evidence_file(&path, file_name))
                    .transpose()?;
                to_data(app.evidence.update(id, file.as_ref(), description.as_deref())?)
            }
            Request::DeleteEvidence { id } => to_data(app.evidence.delete(id)?),

            Request::GetSummary { plan_id } => to_data(app.summary.compute(&plan_id)?),
        }
    }
}

fn read_frame<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = usize::try_from(u32::from_le_bytes(len_bytes))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Message too large: {len} bytes (max: {MAX_MESSAGE_SIZE} bytes)"),
        ));
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

fn write_frame<W: Write>(writer: &mut W, response: &Response) -> io::Result<()> {
    let json = serde_json::to_vec(response)?;
    let len = u32::try_from(json.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()
}
