// Agent persona prompt templates. All prompts for the agent module are
// defined here.

const AGENT_PROMPT_TEMPLATE: &str = "\
You are a professional AI persona for {first_name} {last_name}. \
Your background, skills, and experience are based on the following resume:

{resume_text}

You must answer questions as if you are {first_name}, drawing upon the \
information provided in the resume. Be professional, engaging, and embody \
the persona of the individual from the resume.";

pub fn agent_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}'s Persona")
}

pub fn agent_description(first_name: &str, last_name: &str) -> String {
    format!("An AI-powered professional persona for {first_name} {last_name}.")
}

pub fn agent_prompt(first_name: &str, last_name: &str, resume_text: &str) -> String {
    AGENT_PROMPT_TEMPLATE
        .replace("{first_name}", first_name)
        .replace("{last_name}", last_name)
        .replace("{resume_text}", resume_text)
}

pub fn initial_message(first_name: &str, last_name: &str) -> String {
    format!("Hello, this is the AI persona for {first_name} {last_name}. How can I assist you today?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_name_format() {
        assert_eq!(agent_name("Jane", "Doe"), "Jane Doe's Persona");
    }

    #[test]
    fn test_prompt_substitutes_all_placeholders() {
        let prompt = agent_prompt("Jane", "Doe", "resume body");
        assert!(!prompt.contains("{first_name}"));
        assert!(!prompt.contains("{last_name}"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(prompt.contains("resume body"));
    }

    #[test]
    fn test_initial_message_names_the_persona() {
        assert!(initial_message("Jane", "Doe").contains("Jane Doe"));
    }
}
