use chrono::NaiveDate;

/// Build the fixed instruction set handed to the extraction service.
///
/// `reference_date` is what an explicit "immediately"/"now" availability
/// statement normalizes to.
pub fn build_instructions(reference_date: NaiveDate) -> String {
    format!(
        r#"You are a specialized data extraction assistant for apartment rental advertisements. Your task is to extract specific data points and return them STRICTLY in JSON format.

REQUIRED FIELDS (must be included if found):
- "nb_room": Total number of rooms (including ALL rooms - bedrooms, bathrooms, etc.)
- "bedrooms_to_rent": Number of available bedrooms for rent

OPTIONAL FIELDS (include ONLY if explicitly mentioned and certain):
- "nb_male": Current number of male residents (only if clearly stated)
- "nb_female": Current number of female residents (only if clearly stated)
- "apart_loc": Apartment location (only if a specific address or area is mentioned)
- "rent_date": Available date in YYYY-MM-DD format (only if explicitly stated)

IMPORTANT RULES:
1. Return ONLY the JSON object, no additional text
2. If the ad restricts the listing to one gender (e.g. "girls only"), return an empty JSON object: {{}}
3. Do NOT include optional fields if they are uncertain or require assumptions
4. Do NOT attempt to guess or infer dates from context
5. For dates:
   - Only parse explicit dates (e.g. "January 15th", "15/01/2025", "next month")
   - Convert all dates to YYYY-MM-DD format
   - If "immediate" or "now" is mentioned, use {reference}
   - If only a month is mentioned (e.g. "from March"), use the 1st of that month
   - Do NOT include rent_date if the date is ambiguous

Example response:
{{
    "nb_room": 3,
    "bedrooms_to_rent": 1,
    "nb_male": 2,
    "apart_loc": "123 Main Street",
    "rent_date": "2025-02-01"
}}"#,
        reference = reference_date.format("%Y-%m-%d"),
    )
}

/// Build the per-ad user message.
pub fn build_user_message(title: &str, text: &str) -> String {
    format!(
        "Here is an apartment advertisement text you need to parse, according to the rules you were given. The title of the ad is {title} and the text is: {text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_embed_the_reference_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
        let instructions = build_instructions(date);
        assert!(instructions.contains("2025-01-17"));
        assert!(instructions.contains("bedrooms_to_rent"));
    }

    #[test]
    fn user_message_carries_title_and_text() {
        let message = build_user_message("Room for rent", "2 bedrooms available");
        assert!(message.contains("Room for rent"));
        assert!(message.contains("2 bedrooms available"));
    }
}
