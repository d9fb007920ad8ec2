pub mod company;
pub mod fixed_shift;
pub mod member;
pub mod notice;
pub mod notice_input;
pub mod schedule;
pub mod schedule_input;
pub mod swap_input;
pub mod swap_request;

pub use company::{Company, CreateCompanyInput};
pub use fixed_shift::{FixedShift, FixedShiftConfig, FixedShiftEntry, UpdateFixedShiftsInput};
pub use member::Member;
pub use notice::{Notice, NoticeWithWriter};
pub use notice_input::{CreateNoticeInput, NoticeMutationResponse, UpdateNoticeInput};
pub use schedule::{Schedule, ScheduleAssignment, ScheduleWithWorkers};
pub use schedule_input::{AssignWorkerInput, CreateScheduleInput, ScheduleMutationResponse};
pub use swap_input::{
    CreateSwapRequestInput, CreateSwapRequestResponse, SwapMutationResponse, SwapRequestSummary,
};
pub use swap_request::{SwapRequest, SwapStatus, SwapType};
