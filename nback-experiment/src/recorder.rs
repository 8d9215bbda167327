use nback_core::{Section, TrialRecord};

/// Append-only store of every trial record of one participant
#[derive(Debug, Default, Clone)]
pub struct ResponseRecorder {
    records: Vec<TrialRecord>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn section(&self, section: Section) -> impl Iterator<Item = &TrialRecord> {
        self.records.iter().filter(move |r| r.section == section)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nback_core::{Letter, Trial};

    #[test]
    fn keeps_append_order_across_sections() {
        let mut recorder = ResponseRecorder::new();
        for (i, section) in [Section::Train1, Section::Pre, Section::Train1]
            .into_iter()
            .enumerate()
        {
            let trial = Trial::new(i, Letter::Q, false);
            recorder.append(trial.into_record(5, "visual-easy", section));
        }
        let trials: Vec<_> = recorder.records().iter().map(|r| r.trial).collect();
        assert_eq!(trials, vec![1, 2, 3]);
        assert_eq!(recorder.section(Section::Train1).count(), 2);
        assert_eq!(recorder.into_records().len(), 3);
    }
}
