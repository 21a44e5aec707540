use super::context::AssemblyContext;
use super::error::EngineError;
use super::join::join;
use super::progress::Progress;
use crate::core::models::fragment::Fragment;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One attempted join that passed the matcher.
#[derive(Debug)]
pub(crate) enum Candidate {
    Built(Fragment),
    /// The join was valid but the chemistry provider could not describe the
    /// result. Only this candidate is lost.
    Fault {
        left: String,
        right: String,
        error: EngineError,
    },
}

/// Tries every open point of every frontier fragment against every open point of
/// every partner.
///
/// Frontier fragments are expanded independently (in parallel with the `parallel`
/// feature); the returned candidates are ordered by frontier position, then by
/// connection point, partner and partner point, whatever the thread schedule.
#[instrument(skip_all, name = "expand_level", fields(frontier = frontier.len()))]
pub(crate) fn expand_level(
    frontier: &[Fragment],
    partners: &[&Fragment],
    context: &AssemblyContext,
) -> Result<Vec<Candidate>, EngineError> {
    let include_frontier = context.config.partners.includes_frontier();

    #[cfg(not(feature = "parallel"))]
    let iterator = frontier.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = frontier.par_iter().enumerate();

    let per_fragment = iterator
        .map(|(position, fragment)| {
            let others: Vec<&Fragment> = if include_frontier {
                frontier
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != position)
                    .map(|(_, f)| f)
                    .collect()
            } else {
                Vec::new()
            };
            let result = expand_fragment(fragment, partners.iter().copied().chain(others), context);
            context.reporter.report(Progress::FragmentExpanded);
            result
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(per_fragment.into_iter().flatten().collect())
}

fn expand_fragment<'p>(
    fragment: &Fragment,
    partners: impl Iterator<Item = &'p Fragment> + Clone,
    context: &AssemblyContext,
) -> Result<Vec<Candidate>, EngineError> {
    let mut candidates = Vec::new();

    for (i, point) in fragment.open_connection_points() {
        for partner in partners.clone() {
            for (j, partner_point) in partner.open_connection_points() {
                if !point.can_connect_to(partner_point) {
                    continue;
                }
                match join(fragment, i, partner, j, context.chemistry) {
                    Ok(complex) => candidates.push(Candidate::Built(complex)),
                    Err(error) if error.is_candidate_fault() => {
                        candidates.push(Candidate::Fault {
                            left: fragment.name().to_string(),
                            right: partner.name().to_string(),
                            error,
                        })
                    }
                    Err(error) => return Err(error),
                }
            }
        }
    }

    debug!(
        fragment = fragment.name(),
        candidates = candidates.len(),
        "Expanded fragment"
    );
    Ok(candidates)
}
