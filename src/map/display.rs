use crate::map::models::{LatLng, MapView};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum MapCommand {
    SetView { view: MapView },
    PlaceGuessMarker { position: LatLng },
    PlaceTargetMarker { position: LatLng },
    ClearGuessMarker,
    ClearAllTargetMarkers,
}

pub trait MapDisplay {
    fn set_view(&mut self, view: MapView);

    fn place_guess_marker(&mut self, position: LatLng);

    fn place_target_marker(&mut self, position: LatLng);

    fn clear_guess_marker(&mut self);

    fn clear_all_target_markers(&mut self);
}

impl MapDisplay for Vec<MapCommand> {
    fn set_view(&mut self, view: MapView) {
        self.push(MapCommand::SetView { view });
    }

    fn place_guess_marker(&mut self, position: LatLng) {
        self.push(MapCommand::PlaceGuessMarker { position });
    }

    fn place_target_marker(&mut self, position: LatLng) {
        self.push(MapCommand::PlaceTargetMarker { position });
    }

    fn clear_guess_marker(&mut self) {
        self.push(MapCommand::ClearGuessMarker);
    }

    fn clear_all_target_markers(&mut self) {
        self.push(MapCommand::ClearAllTargetMarkers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_a_command_tag() {
        let command = MapCommand::PlaceTargetMarker {
            position: LatLng {
                lat: -31.95,
                lng: 115.86,
            },
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            serde_json::json!({
                "command": "placeTargetMarker",
                "position": {"lat": -31.95, "lng": 115.86},
            })
        );
        assert_eq!(
            serde_json::to_value(MapCommand::ClearGuessMarker).unwrap(),
            serde_json::json!({"command": "clearGuessMarker"})
        );
    }
}
