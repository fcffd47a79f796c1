mod normalize;

pub use normalize::{
    normalize, NormalizedResult, TaskRunReport, FAILURE_CODE, FAILURE_STATUS, SUCCESS_CODE,
    SUCCESS_STATUS,
};
