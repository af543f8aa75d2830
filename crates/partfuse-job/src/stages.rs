/// Instruction sent back to the queue for a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Acknowledge: the job is done.
    Ack,
    /// Negative-acknowledge and requeue: a later stage failed transiently,
    /// regenerating is wasteful but safe.
    NackRequeue,
    /// Negative-acknowledge without requeue: the same payload would fail the
    /// same way again.
    NackDrop,
}

/// Independent per-stage outcomes of one job. The final disposition is a
/// pure function of these booleans and never of error identity, which keeps
/// the reliability policy auditable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOutcomes {
    pub parse_failed: bool,
    pub generated: bool,
    pub uploaded: bool,
    pub patched: bool,
}

impl StageOutcomes {
    pub fn disposition(self) -> Disposition {
        if self.parse_failed {
            // A malformed payload parses the same way every time.
            return Disposition::NackDrop;
        }

        if self.generated && self.uploaded && self.patched {
            Disposition::Ack
        } else if self.generated {
            // Storage or callback failed after a good build; both are
            // re-creatable, so retrying cannot lose data.
            Disposition::NackRequeue
        } else {
            Disposition::NackDrop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(generated: bool, uploaded: bool, patched: bool) -> StageOutcomes {
        StageOutcomes {
            parse_failed: false,
            generated,
            uploaded,
            patched,
        }
    }

    #[test]
    fn disposition_table_is_exhaustive() {
        // (generated, uploaded, patched) -> disposition, all eight rows.
        let table = [
            ((false, false, false), Disposition::NackDrop),
            ((false, false, true), Disposition::NackDrop),
            ((false, true, false), Disposition::NackDrop),
            ((false, true, true), Disposition::NackDrop),
            ((true, false, false), Disposition::NackRequeue),
            ((true, false, true), Disposition::NackRequeue),
            ((true, true, false), Disposition::NackRequeue),
            ((true, true, true), Disposition::Ack),
        ];

        for ((generated, uploaded, patched), expected) in table {
            assert_eq!(
                outcomes(generated, uploaded, patched).disposition(),
                expected,
                "generated={generated} uploaded={uploaded} patched={patched}"
            );
        }
    }

    #[test]
    fn parse_failure_short_circuits_to_drop() {
        let outcomes = StageOutcomes {
            parse_failed: true,
            ..Default::default()
        };
        assert_eq!(outcomes.disposition(), Disposition::NackDrop);
    }
}
