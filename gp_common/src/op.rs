/// Implements arithmetic operator traits for a single-field newtype by delegating to the wrapped value.
///
/// ```ignore
/// op!(arith Money: Add::add, Sub::sub);
/// op!(assign Money: AddAssign::add_assign);
/// ```
#[macro_export]
macro_rules! op {
    (arith $for_struct:ident: $($impl_trait:ident::$impl_fn:ident),+) => {
        $(
            impl std::ops::$impl_trait for $for_struct {
                type Output = Self;

                fn $impl_fn(self, rhs: Self) -> Self::Output {
                    Self(std::ops::$impl_trait::$impl_fn(self.0, rhs.0))
                }
            }
        )+
    };

    (assign $for_struct:ident: $($impl_trait:ident::$impl_fn:ident),+) => {
        $(
            impl std::ops::$impl_trait for $for_struct {
                fn $impl_fn(&mut self, rhs: Self) {
                    std::ops::$impl_trait::$impl_fn(&mut self.0, rhs.0)
                }
            }
        )+
    };
}
