pub mod category;
pub mod customer;
pub mod customer_order; // read-only view over orders + customers
pub mod order;
pub mod order_detail;
pub mod product;
pub mod supplier;

pub use category::{Entity as CategoryEntity, Model as CategoryModel};
pub use customer::{Entity as CustomerEntity, Model as CustomerModel};
pub use customer_order::{Entity as CustomerOrderEntity, Model as CustomerOrderModel};
pub use order::{Entity as OrderEntity, Model as OrderModel, OrderStatus, PaymentMethod};
pub use order_detail::{Entity as OrderDetailEntity, Model as OrderDetailModel};
pub use product::{Entity as ProductEntity, Model as ProductModel};
pub use supplier::{Entity as SupplierEntity, Model as SupplierModel};
