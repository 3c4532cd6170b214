use crate::transcript::SpeakerTurn;

/// Merges adjacent turns that share a speaker
///
/// Values of merged turns are joined with a single space. The result never
/// contains two adjacent turns with the same speaker, so consolidating it
/// again returns it unchanged.
pub fn consolidate<I>(turns: I) -> Vec<SpeakerTurn>
where
    I: IntoIterator<Item = SpeakerTurn>,
{
    let mut consolidated: Vec<SpeakerTurn> = Vec::new();

    for turn in turns {
        match consolidated.last_mut() {
            Some(last) if last.speaker == turn.speaker => {
                last.value.push(' ');
                last.value.push_str(&turn.value);
            }
            _ => consolidated.push(turn),
        }
    }

    consolidated
}
