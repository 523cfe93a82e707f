use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: String,
}
