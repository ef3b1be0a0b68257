// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Traffic and payload generators for abuse simulation.

use marsala_site::validator::ContactRequest;

/// Generate a pool of client identifiers in the 10.x.x.x range.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("10.{}.{}.{}", (i >> 16) & 0xFF, (i >> 8) & 0xFF, i & 0xFF))
        .collect()
}

/// A contact payload that passes validation.
pub fn valid_contact(i: usize) -> ContactRequest {
    ContactRequest {
        name: format!("Visitor {i}"),
        email: format!("visitor{i}@example.com"),
        company: None,
        website: None,
        message: "Interested in a systems audit.".to_string(),
    }
}

/// Contact payloads that must all be rejected.
pub fn junk_contacts() -> Vec<ContactRequest> {
    vec![
        ContactRequest::default(),
        ContactRequest {
            email: "not-an-email".to_string(),
            ..valid_contact(0)
        },
        ContactRequest {
            website: Some("javascript:alert(1)".to_string()),
            ..valid_contact(1)
        },
        ContactRequest {
            message: "x".repeat(5001),
            ..valid_contact(2)
        },
        ContactRequest {
            name: "   ".to_string(),
            ..valid_contact(3)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients_unique() {
        let clients = generate_clients(300);
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 300);
    }
}
