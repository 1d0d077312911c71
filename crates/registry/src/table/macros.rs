//! Declarative slot table construction.

/// Declares a container's slots and builds its [`SlotTable`](crate::SlotTable).
///
/// Each entry is a producer name followed by its default. Plain names derive their key by
/// stripping the configured suffix; `name as "key"` sets the key explicitly. Expands to the
/// equivalent [`SlotTableBuilder`](crate::SlotTableBuilder) chain and evaluates to its
/// `Result`.
///
/// ```
/// use slotkit_registry::{Text, slot_table};
///
/// let table = slot_table! {
/// 	container = "ProfileCard";
/// 	header_view => || Text::new("Profile"),
/// 	details_view as "body" => || Text::new("No details"),
/// }
/// .unwrap();
///
/// assert!(table.contains("header"));
/// assert!(table.contains("body"));
/// ```
#[macro_export]
macro_rules! slot_table {
	(@slot $builder:ident, $name:ident as $key:literal, $default:expr) => {
		$builder.slot_as(stringify!($name), $key, $default)
	};
	(@slot $builder:ident, $name:ident, $default:expr) => {
		$builder.slot(stringify!($name), $default)
	};
	(
		container = $container:expr $(, config = $config:expr)? ;
		$( $name:ident $(as $key:literal)? => $default:expr ),* $(,)?
	) => {{
		let builder = $crate::SlotTable::builder($container);
		$( let builder = builder.with_config($config); )?
		$( let builder = $crate::slot_table!(@slot builder, $name $(as $key)?, $default); )*
		builder.build()
	}};
}
