use std::collections::HashSet;

use rand::Rng;
use crate::models::{Family, MemberView, Role, User};

pub const JOIN_CODE_LEN: usize = 6;
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a join code that is not in `existing`.
///
/// Codes are 6 characters over `A-Z0-9` (36^6, about 2.2 billion values), so a retry is rare.
/// Only loops forever if every possible code is already taken.
pub fn generate_join_code(existing: &HashSet<String>) -> String {
    generate_join_code_with(&mut rand::thread_rng(), existing)
}

/// Same as [`generate_join_code`] with a caller-supplied random source.
pub fn generate_join_code_with<R: Rng>(rng: &mut R, existing: &HashSet<String>) -> String {
    loop {
        let code: String = (0..JOIN_CODE_LEN)
            .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
            .collect();
        if !existing.contains(&code) {
            return code;
        }
        tracing::debug!(%code, "join code collision, retrying");
    }
}

/// Trims and upper-cases a code typed by a user.
pub fn normalize_join_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn is_valid_join_code(code: &str) -> bool {
    code.len() == JOIN_CODE_LEN && code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b))
}

pub fn is_member(family: &Family, uid: &str) -> bool {
    family.members.iter().any(|m| m == uid)
}

/// Adds `uid` to the family. Joining twice is a no-op.
pub fn join_family(mut family: Family, uid: &str) -> Family {
    if !is_member(&family, uid) {
        family.members.push(uid.to_string());
    }
    family
}

/// The families `uid` may pick as their current family, in stored order.
pub fn visible_families_for<'a>(families: &'a [Family], uid: &str) -> Vec<&'a Family> {
    families.iter().filter(|f| is_member(f, uid)).collect()
}

pub fn role_of(family: &Family, uid: &str) -> Role {
    if family.created_by == uid {
        Role::Owner
    } else {
        Role::Member
    }
}

/// Members in join order with their profile and derived role.
///
/// A member without a stored profile is shown by uid.
pub fn members_of(family: &Family, users: &[User]) -> Vec<MemberView> {
    family
        .members
        .iter()
        .map(|uid| {
            let user = users.iter().find(|u| &u.uid == uid);
            MemberView {
                uid: uid.clone(),
                display_name: user
                    .map(|u| u.display_name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| uid.clone()),
                email: user.map(|u| u.email.clone()).unwrap_or_default(),
                role: role_of(family, uid),
            }
        })
        .collect()
}

pub fn find_by_join_code<'a>(families: &'a [Family], code: &str) -> Option<&'a Family> {
    let code = normalize_join_code(code);
    families.iter().find(|f| f.join_code == code)
}
