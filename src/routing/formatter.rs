use super::{Resolution, Route, RouteReason};

/// Formats routing resolutions into human-readable explanations
pub struct RouteFormatter;

impl RouteFormatter {
    /// Explain a resolution, e.g. `edge to 'q9' is hidden; continuing with 'q3'`.
    pub fn explain(resolution: &Resolution) -> String {
        let destination = Self::format_route(&resolution.route);
        match &resolution.reason {
            RouteReason::ResultBucket => destination,
            RouteReason::ExplicitEdge => format!("explicit edge, {}", destination),
            RouteReason::MissingTarget(target) => {
                format!("edge to '{}' names no question; {}", target, destination)
            }
            RouteReason::HiddenTarget(target) => {
                format!("edge to '{}' is hidden; {}", target, destination)
            }
            RouteReason::RevisitedTarget(target) => {
                format!("edge to '{}' was already answered; {}", target, destination)
            }
            RouteReason::EmptyTarget(target) => {
                format!("edge to '{}' has no answers; {}", target, destination)
            }
            RouteReason::NoRouting => format!("no routing; {}", destination),
            RouteReason::UnknownAnswer(answer_id) => {
                format!("unknown answer '{}'; {}", answer_id, destination)
            }
        }
    }

    fn format_route(route: &Route) -> String {
        match route {
            Route::Question(id) => format!("continuing with '{}'", id),
            Route::Bucket(key) => format!("result bucket '{}'", key),
            Route::End => "no questions remain".to_string(),
        }
    }
}
