pub mod history_record;
pub mod match_pair;
pub mod player_state;
pub mod score_event;
pub mod skillset;
