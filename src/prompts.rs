//! Fixed texts shown to or sent on behalf of website visitors.

/// System instruction for the "Serena" chat persona.
pub const PERSONA: &str = include_str!("../data/prompts/persona.txt");

/// Reply when no backend credential is configured.
pub const UNAVAILABLE_REPLY: &str = "Mi dispiace, al momento non riesco a connettermi al servizio di assistenza. Per favore chiamaci direttamente.";

/// Reply when the backend answers without any text.
pub const CLARIFICATION_REPLY: &str = "Mi scuso, non ho capito bene. Potresti riformulare?";

/// Reply when the backend call fails.
pub const TEMPORARY_ERROR_REPLY: &str = "Si è verificato un errore momentaneo. Ti preghiamo di riprovare tra poco o di contattarci telefonicamente.";
