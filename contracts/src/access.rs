use crate::{ListtoList, Visibility};
use std::{error::Error, fmt::Display};

impl ListtoList {
    /// Whether the given user, holding the given roles, may use this list
    pub fn can_access(&self, user: &str, roles: &[String]) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => self
                .access
                .iter()
                .any(|allowed| allowed == user || roles.contains(allowed)),
            Visibility::Personal => self.guild == user,
        }
    }

    /// Grants access to each id not already in the access list.
    ///
    /// Does nothing for lists that aren't private. Returns the number of ids added.
    pub fn add_access(&mut self, ids: &[String]) -> usize {
        if self.visibility != Visibility::Private {
            return 0;
        }

        let before = self.access.len();
        for id in ids {
            if !self.access.contains(id) {
                self.access.push(id.clone());
            }
        }
        self.access.len() - before
    }

    /// Revokes access for each id in `ids`.
    ///
    /// Does nothing for lists that aren't private. Refuses, without changing anything,
    /// when the removal would leave a private list with nobody allowed to use it.
    pub fn remove_access(&mut self, ids: &[String]) -> Result<usize, AccessError> {
        if self.visibility != Visibility::Private {
            return Ok(0);
        }

        let remaining = self.access.iter().filter(|id| !ids.contains(*id)).count();
        if remaining == 0 && !self.access.is_empty() {
            return Err(AccessError::LastGrantee);
        }

        let mut removed = 0;
        for id in ids {
            if let Some(index) = self.access.iter().position(|allowed| allowed == id) {
                self.access.swap_remove(index);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    LastGrantee,
}

impl Error for AccessError {}

impl Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            AccessError::LastGrantee => {
                "I can't remove everyone from a private list, someone needs to keep access to it"
            }
        };

        write!(f, "{}", output)
    }
}
