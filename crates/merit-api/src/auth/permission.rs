// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission definitions for role-based access control.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Permission
// =============================================================================

/// Permissions gating API routes.
///
/// The wire form (`resource:action`) is what the permission store hands
/// back; routes declare the typed variant they require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // =========================================================================
    // Account Permissions
    // =========================================================================
    /// Manage user accounts and role assignments.
    UserManage,

    // =========================================================================
    // Achievement Permissions
    // =========================================================================
    /// Create own achievement records.
    AchievementCreate,
    /// Update own draft achievements.
    AchievementUpdate,
    /// Delete own draft achievements.
    AchievementDelete,
    /// Submit an achievement for verification.
    AchievementSubmit,
    /// Attach evidence files to an achievement.
    AchievementUpload,
    /// Read advisees' achievements.
    AchievementReadAdvisee,
    /// Verify a submitted achievement.
    AchievementVerify,
    /// Reject a submitted achievement.
    AchievementReject,

    // =========================================================================
    // Reporting Permissions
    // =========================================================================
    /// View aggregate reports.
    ReportView,
}

impl Permission {
    /// Returns the permission name as stored in the permission store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserManage => "user:manage",
            Permission::AchievementCreate => "achievement:create",
            Permission::AchievementUpdate => "achievement:update",
            Permission::AchievementDelete => "achievement:delete",
            Permission::AchievementSubmit => "achievement:submit",
            Permission::AchievementUpload => "achievement:upload",
            Permission::AchievementReadAdvisee => "achievement:read_advisee",
            Permission::AchievementVerify => "achievement:verify",
            Permission::AchievementReject => "achievement:reject",
            Permission::ReportView => "report:view",
        }
    }

    /// Parses a permission from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user:manage" => Some(Permission::UserManage),
            "achievement:create" => Some(Permission::AchievementCreate),
            "achievement:update" => Some(Permission::AchievementUpdate),
            "achievement:delete" => Some(Permission::AchievementDelete),
            "achievement:submit" => Some(Permission::AchievementSubmit),
            "achievement:upload" => Some(Permission::AchievementUpload),
            "achievement:read_advisee" => Some(Permission::AchievementReadAdvisee),
            "achievement:verify" => Some(Permission::AchievementVerify),
            "achievement:reject" => Some(Permission::AchievementReject),
            "report:view" => Some(Permission::ReportView),
            _ => None,
        }
    }

    /// Returns all defined permissions.
    pub fn all() -> &'static [Permission] {
        &[
            Permission::UserManage,
            Permission::AchievementCreate,
            Permission::AchievementUpdate,
            Permission::AchievementDelete,
            Permission::AchievementSubmit,
            Permission::AchievementUpload,
            Permission::AchievementReadAdvisee,
            Permission::AchievementVerify,
            Permission::AchievementReject,
            Permission::ReportView,
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// PermissionSet
// =============================================================================

/// A subject's effective permissions, as fetched from the store.
///
/// Built fresh on every authorization check from the store's raw
/// permission names; names the enum does not know are kept verbatim so
/// a store can carry grants this binary predates.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    names: HashSet<String>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a permission set from store-provided names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the set holds the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.names.contains(permission.as_str())
    }

    /// Returns `true` if the set holds the permission name.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of grants in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns an iterator over the grant names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

// =============================================================================
// Role
// =============================================================================

/// Built-in roles and their default grants.
///
/// The permission store owns the live role-permission mapping; this
/// table only seeds development directories and test fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits and manages own achievement records.
    Student,
    /// Reviews and verifies advisees' achievements.
    Advisor,
    /// Manages accounts and views aggregate reports.
    Admin,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Advisor => "advisor",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Role::Student),
            "advisor" | "lecturer" => Some(Role::Advisor),
            "admin" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns the default permissions for this role.
    pub fn default_permissions(&self) -> Vec<Permission> {
        match self {
            Role::Student => vec![
                Permission::AchievementCreate,
                Permission::AchievementUpdate,
                Permission::AchievementDelete,
                Permission::AchievementSubmit,
                Permission::AchievementUpload,
            ],
            Role::Advisor => vec![
                Permission::AchievementReadAdvisee,
                Permission::AchievementVerify,
                Permission::AchievementReject,
            ],
            Role::Admin => vec![Permission::UserManage, Permission::ReportView],
        }
    }

    /// Returns the default permission names for this role.
    pub fn default_permission_names(&self) -> Vec<&'static str> {
        self.default_permissions()
            .into_iter()
            .map(|p| p.as_str())
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
