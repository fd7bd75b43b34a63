pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod sea_orm_repo;

pub use memory_repo::InMemoryTeachersRepository;
pub use sea_orm_repo::SeaOrmTeachersRepository;
