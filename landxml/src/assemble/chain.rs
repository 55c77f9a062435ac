//! Jonction des segments consécutifs en chaînes

use geo::Coord;

/// Joint les chaînes consécutives qui partagent une extrémité.
///
/// Une chaîne qui commence là où la précédente se termine la prolonge (le
/// point de jonction n'est conservé qu'une fois); sinon elle démarre une
/// nouvelle chaîne. Les segments ne sont ni retournés ni réordonnés: l'ordre
/// du document fait foi.
pub fn join_chains<I>(segments: I) -> Vec<Vec<Coord>>
where
    I: IntoIterator<Item = Vec<Coord>>,
{
    let mut chains: Vec<Vec<Coord>> = Vec::new();

    for segment in segments {
        let Some(&first) = segment.first() else {
            continue;
        };

        match chains.last_mut() {
            Some(current) if current.last() == Some(&first) => {
                current.extend(segment.into_iter().skip(1));
            }
            _ => chains.push(segment),
        }
    }

    chains
}
