// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Children and teacher assignments.
//!
//! These records are only read by the access-control core. They decide which
//! children a teacher can see and whether a parent and a teacher share a care
//! relationship.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AssignmentId, ChildId, PrincipalId, RecordStatus};

/// An enrolled child. Belongs to exactly one parent profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
	pub id: ChildId,
	pub parent_id: PrincipalId,
	pub name: String,
	pub date_of_birth: Option<NaiveDate>,
	pub age_group: Option<String>,
	/// Children are deactivated, never hard-deleted.
	pub status: RecordStatus,
	pub created_at: DateTime<Utc>,
}

/// A care relationship between a teacher and a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAssignment {
	pub id: AssignmentId,
	pub teacher_id: PrincipalId,
	pub child_id: ChildId,
	pub status: RecordStatus,
	pub created_at: DateTime<Utc>,
}

/// Returns true if any active assignment links `teacher_id` to one of the
/// given active children.
///
/// Callers pass the parent's active children; inactive children are ignored
/// here as well so a stale list cannot grant a relationship.
pub fn has_care_link(
	teacher_id: PrincipalId,
	children: &[Child],
	assignments: &[TeacherAssignment],
) -> bool {
	assignments.iter().any(|a| {
		a.teacher_id == teacher_id
			&& a.status.is_active()
			&& children
				.iter()
				.any(|c| c.id == a.child_id && c.status.is_active())
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn child(parent: PrincipalId, status: RecordStatus) -> Child {
		Child {
			id: ChildId::generate(),
			parent_id: parent,
			name: "Mia".to_string(),
			date_of_birth: None,
			age_group: Some("toddler".to_string()),
			status,
			created_at: Utc::now(),
		}
	}

	fn assignment(teacher: PrincipalId, child: ChildId, status: RecordStatus) -> TeacherAssignment {
		TeacherAssignment {
			id: AssignmentId::generate(),
			teacher_id: teacher,
			child_id: child,
			status,
			created_at: Utc::now(),
		}
	}

	#[test]
	fn active_assignment_to_active_child_is_a_link() {
		let parent = PrincipalId::generate();
		let teacher = PrincipalId::generate();
		let c = child(parent, RecordStatus::Active);
		let a = assignment(teacher, c.id, RecordStatus::Active);

		assert!(has_care_link(teacher, &[c], &[a]));
	}

	#[test]
	fn no_children_means_no_link() {
		let teacher = PrincipalId::generate();
		let a = assignment(teacher, ChildId::generate(), RecordStatus::Active);

		assert!(!has_care_link(teacher, &[], &[a]));
	}

	#[test]
	fn inactive_assignment_is_not_a_link() {
		let parent = PrincipalId::generate();
		let teacher = PrincipalId::generate();
		let c = child(parent, RecordStatus::Active);
		let a = assignment(teacher, c.id, RecordStatus::Inactive);

		assert!(!has_care_link(teacher, &[c], &[a]));
	}

	#[test]
	fn inactive_child_is_not_a_link() {
		let parent = PrincipalId::generate();
		let teacher = PrincipalId::generate();
		let c = child(parent, RecordStatus::Inactive);
		let a = assignment(teacher, c.id, RecordStatus::Active);

		assert!(!has_care_link(teacher, &[c], &[a]));
	}

	#[test]
	fn assignment_for_another_teacher_is_not_a_link() {
		let parent = PrincipalId::generate();
		let c = child(parent, RecordStatus::Active);
		let a = assignment(PrincipalId::generate(), c.id, RecordStatus::Active);

		assert!(!has_care_link(PrincipalId::generate(), &[c], &[a]));
	}
}
