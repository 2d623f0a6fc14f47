use crate::core::message::Message;

/// Append-only, ordered record of everything shown in the chat pane.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.entries.push(message);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bot_count(&self) -> usize {
        self.entries.iter().filter(|m| m.is_from_bot).count()
    }

    pub fn user_count(&self) -> usize {
        self.entries.len() - self.bot_count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("one"));
        let last = transcript.push(Message::bot("two"));
        assert_eq!(last.text, "two");

        let texts: Vec<&str> = transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(transcript.user_count(), 1);
        assert_eq!(transcript.bot_count(), 1);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("same"));
        transcript.push(Message::user("same"));
        assert_eq!(transcript.len(), 2);
    }
}
