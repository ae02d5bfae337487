pub const TIMEOUT_RESULT: &str = "Time's up! You didn't guess. Score: 0 for this round.";
pub const DISTANCE_UNAVAILABLE_RESULT: &str =
    "Error: distance unavailable. Score: 0 for this round.";

pub fn round(round: u64, max_rounds: u64) -> String {
    format!("Round: {round}/{max_rounds}")
}

pub fn target(name: &str) -> String {
    format!("Guess: {name}")
}

pub fn timer(secs_left: u64) -> String {
    format!("Time left: {secs_left}s")
}

pub fn score(score: u64) -> String {
    format!("Score: {score}")
}

pub fn scored_result(distance_km: f64, points: u64) -> String {
    format!("Distance: {distance_km:.2} km | Points this round: {points}")
}

pub fn final_score(score: u64) -> String {
    format!("Your final score is {score}. Want to play again?")
}

pub fn distance_cell(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(distance_km) => format!("{distance_km:.2}"),
        None => String::from("-"),
    }
}
