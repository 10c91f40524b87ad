// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy risk assessment
//!
//! A fixed point-deduction rubric over a serialized policy. Pure and
//! deterministic: the same policy always yields the same issues in the same
//! order.

mod assessor;
mod rubric;

pub use assessor::{assess_policy, RiskAssessment, RiskAssessor, RiskIssue, RiskLevel, MAX_SCORE};
pub use rubric::RiskRubric;
