use uuid::Uuid;

use warfront_game::models::city::City;
use warfront_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait CityRepository: Send + Sync {
    async fn get_by_id(&self, city_id: Uuid) -> Result<City, ApplicationError>;

    async fn list_by_player_id(&self, player_id: Uuid) -> Result<Vec<City>, ApplicationError>;

    /// Writes resources, garrison and defenses back.
    async fn save(&self, city: &City) -> Result<(), ApplicationError>;
}
